pub mod reform;

pub use reform::handle_reform;
