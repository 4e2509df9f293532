pub mod config;
pub mod export;
pub mod logger;
pub mod media;
pub mod site;
pub mod site_writer;
pub mod text_utils;
pub mod util;
pub mod view;
#[cfg(test)]
mod test_data;
