//! sandpiper web server and UI.
//!
//! This crate provides the Leptos-based web interface for the sandpiper
//! social platform, plus the `/v1` JSON API the interface (and other
//! clients) talk to.

#![allow(non_snake_case)]

pub mod app;
pub mod pages;

#[cfg(feature = "ssr")]
pub mod api;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod db;
#[cfg(feature = "ssr")]
pub mod error;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
