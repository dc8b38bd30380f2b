// Copyright (c) 2024 Finch Project Authors.
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

//! `HTTP/1` message components: the request-head encoder, the
//! response-head decoder and the end-of-headers scanner they share.

mod scanner;

pub mod request;
pub mod response;

pub use request::RequestEncoder;
pub use response::{parse_field_block, ResponseDecoder};
pub use scanner::HeadersEndScanner;
