// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! I/O module - mesh file import

mod obj;

pub use obj::{import_obj_file, parse_obj, ImportConfig, ObjError, ObjImport};
