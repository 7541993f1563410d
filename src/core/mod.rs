pub mod config;
pub mod detection;
pub mod overlay;
pub mod playback;
pub mod video;

#[cfg(test)]
pub(crate) mod test_support;
