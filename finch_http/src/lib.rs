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

//! `finch_http` provides the protocol components an `HTTP/1.1` client
//! needs: header types, the request-head encoder, the response-head
//! decoder, the end-of-headers scanner and the chunk-header parser. The
//! components are byte-oriented and I/O-agnostic; `finch_http_client`
//! builds a transport-driving client core on top of them.

pub mod body;
pub mod error;
pub mod h1;
pub mod headers;
pub mod request;
pub mod response;
pub mod version;

pub(crate) mod util;
