// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runnable demos for the Bracken crates. See the `examples/` directory;
//! each example is a scripted pointer stream driven through the engine.
