// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod functions;
pub mod kubernetes;
pub mod storage;
pub mod types;

#[cfg(test)]
pub mod test_utils;
