mod common;
mod locks;
