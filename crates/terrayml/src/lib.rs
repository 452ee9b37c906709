//! # terrayml - terraform to terrahub yaml
//!
//! Converts directories of terraform (`.tf`) files into the `template` section of a terrahub
//! component config (`.terrahub.yml`).
//!
//! ## Introduction for developers
//!
//! Read this to understand how `terrayml` works internally.
//!
//! ### Pipeline
//!
//! For each directory:
//!
//! 1. [source_dir::SourceDirectory] sorts the files: `*.tf` files are converted, `locals.tf` is
//!    skipped, `default.tfvars` becomes the `tfvars` section.
//! 2. Every file is parsed with [hcl_edit] and turned into a generic tree ([value::Value]). The
//!    tree keeps the classic HCL decoder shape where each block sits in its own singleton map.
//! 3. [normalize::Normalizer] merges repeated blocks of the same type into one key.
//! 4. [codec] encodes the tree as json and re-encodes it as yaml.
//! 5. [reshape::reshape] rewrites the yaml of all files (concatenated) into nested maps, driven
//!    by indentation depth.
//! 6. [template::compose] wraps the result into a new document or splices it into an existing
//!    one.
//!
//! [convert::Converter] runs these steps for a directory and its immediate children.
//!
//! ### Example
//!
//! ```hcl
//! resource "aws_instance" "web" {
//!   ami = "ami-1"
//! }
//!
//! resource "aws_instance" "db" {
//!   ami = "ami-2"
//! }
//! ```
//!
//! in a directory named `app` becomes
//!
//! ```yaml
//! ## local config
//! component:
//!   name: 'app'
//!   template:
//!     resource:
//!       aws_instance:
//!         web:
//!           ami: ami-1
//!         db:
//!           ami: ami-2
//! ```
//!
//! ### In place conversion
//!
//! When source and destination directory are the same, converted files (including `locals.tf`
//! and `default.tfvars`) are deleted once the document has been written.
//!
pub mod codec;
pub mod convert;
pub mod normalize;
pub mod reshape;
pub mod source_dir;
pub mod template;
pub mod value;
