// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

pub mod form;
pub mod model;
pub mod predict;
pub mod system;
