pub mod mapper;
pub mod view;

pub use mapper::{to_display_box, Surface};
pub use view::build_view;
