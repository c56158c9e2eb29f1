//! Embedded stylesheet and script for the server-rendered pages.

use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static/"]
pub struct Assets;
