// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A stable, out-of-place partition.
///
/// Returns the items where `predicate` is `true` followed by the items where
/// it is `false`. Both vectors keep the relative order of `items`, which
/// matters because the position of an argument determines its field.
///
/// # Example
/// ```
/// # use fixup_keywords::partition::partition;
/// let (even, odd) = partition([1, 2, 3, 4, 5], |v| v % 2 == 0);
/// assert_eq!(even, vec![2, 4]);
/// assert_eq!(odd, vec![1, 3, 5]);
/// ```
pub fn partition<T, I, P>(items: I, mut predicate: P) -> (Vec<T>, Vec<T>)
where
    I: IntoIterator<Item = T>,
    P: FnMut(&T) -> bool,
{
    items.into_iter().partition(|item| predicate(item))
}
