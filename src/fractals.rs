pub mod common;
pub mod depth_shading;
pub mod newtons_method;
pub mod newtons_method_core;
