pub mod random;
pub mod route_generator;
pub mod routing;
pub mod variety;
