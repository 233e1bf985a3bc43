// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod crawl_gate;
pub mod host_semaphore;
pub mod reqwest_engine;
pub mod traits;
