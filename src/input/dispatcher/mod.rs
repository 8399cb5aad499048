mod actions;
mod core;
mod pointer;

pub use self::core::InputDispatcher;
