pub mod pointer;

pub use pointer::{wire_input_handlers, wire_tile_taps, InputWiring, Listeners};
