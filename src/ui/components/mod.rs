pub mod catalog_list;
pub mod detail_panel;
pub mod footer;
pub mod script_panel;
pub mod tabs;
