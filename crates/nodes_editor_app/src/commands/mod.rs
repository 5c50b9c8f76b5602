// SPDX-License-Identifier: MIT OR Apache-2.0
//! CLI command implementations.

pub mod common;
pub mod config;
pub mod demo;
pub mod inspect;
pub mod nodes;
pub mod normalize;
