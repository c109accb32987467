//! OCI image support.
//!
//! ```text
//!  images/
//!  ├── index.json             (store index: reference → digest, path)
//!  └── sha256/<digest>/       (one OCI image layout per image)
//!      ├── oci-layout
//!      ├── index.json
//!      └── blobs/sha256/      (manifest, config, layers)
//! ```

mod image;
pub mod reference;
pub mod store;

pub use image::{OciImage, OciImageConfig};
pub use reference::{ImageReference, ReferenceError};
pub use store::{ImageStore, StoreIndex, StoredImage};

#[cfg(test)]
pub(crate) use image::tests::create_oci_image;
