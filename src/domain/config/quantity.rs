// Copyright 2025 JiangLong.
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

use crate::shared::error::{Result, WorkspaceError};

/// Parses a Kubernetes memory quantity (`512Mi`, `1.5G`, `1024`) into bytes.
/// Fractions are rounded up to the next byte.
pub fn parse_memory_quantity(s: &str) -> Result<u64> {
    let s = s.trim();

    const KI: f64 = 1024.0;
    const K: f64 = 1000.0;
    let suffixes: [(&str, f64); 12] = [
        ("Ki", KI),
        ("Mi", KI * KI),
        ("Gi", KI * KI * KI),
        ("Ti", KI * KI * KI * KI),
        ("Pi", KI * KI * KI * KI * KI),
        ("Ei", KI * KI * KI * KI * KI * KI),
        ("k", K),
        ("M", K * K),
        ("G", K * K * K),
        ("T", K * K * K * K),
        ("P", K * K * K * K * K),
        ("E", K * K * K * K * K * K),
    ];

    let (num_str, unit) = suffixes
        .iter()
        .find(|(suffix, _)| s.ends_with(suffix))
        .map(|(suffix, unit)| (&s[..s.len() - suffix.len()], *unit))
        .unwrap_or((s, 1.0));

    let invalid = || WorkspaceError::config_error(format!("Invalid memory quantity: {}", s));

    if num_str.is_empty() || !num_str.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }

    let num: f64 = num_str.parse().map_err(|_| invalid())?;
    Ok((num * unit).ceil() as u64)
}
