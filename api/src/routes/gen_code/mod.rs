pub mod gen_code_request;
pub mod gen_code_route;
