mod ordered;

pub use ordered::Ordered;
