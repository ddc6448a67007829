#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for apkfetch
//!
//! This crate provides the data model shared by every other crate: byte
//! ranges, segment kinds, package references and import descriptors, and the
//! lockfile those descriptors are usually read from.

pub mod lockfile;
pub mod package;
pub mod range;

pub use lockfile::{LockContents, LockKeyring, LockPackage, LockRepository, LockSegment, Lockfile};
pub use package::{
    IndexImport, KeyringImport, PackageImport, PackageReference, SegmentKind, SegmentSpec,
};
pub use range::ByteRange;
