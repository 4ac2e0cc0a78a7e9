// src/platform/mod.rs
//
// Host environments the frame can run in, and the raw events they deliver.

pub mod events;
pub mod headless;
pub mod platform_trait;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use events::{Channel, HostEvent, KeyInput, ListenerTarget, PointerInput, WheelInput};
pub use headless::HeadlessPlatform;
pub use platform_trait::{
    AssetCallback, ClipboardReadCallback, ClipboardWriteCallback, Listener, PageStructure,
    Platform,
};

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserPlatform;
