pub mod binder;
pub mod surface;

pub use surface::ViewSurface;
