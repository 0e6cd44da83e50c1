pub mod lanyard_env;
