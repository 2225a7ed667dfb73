// Copyright 2025 Multiclient Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Multiclient CLI
//!
//! Command-line tools for inspecting a network global config before handing
//! it to the multiclient.
//!
//! ## Key Commands
//!
//! - `multiclient list`: Print every liteserver the config describes
//! - `multiclient split`: Write one single-liteserver config per liteserver

pub mod commands;
