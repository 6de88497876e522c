pub mod completion;
pub mod exercise;
pub mod lesson_list;
pub mod lesson_view;
pub mod menu;
pub mod progress_bar;
pub mod progress_view;
pub mod support_popup;
