//! Rules for headings

pub mod endpoint_path_format;

pub use endpoint_path_format::EndpointPathFormat;
