pub mod depth;
