mod configuration;
mod error;
mod metadata;
mod paths;
mod progress;
