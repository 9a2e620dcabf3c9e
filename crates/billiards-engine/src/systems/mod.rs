pub mod rack;
pub mod pockets;
pub mod render;
