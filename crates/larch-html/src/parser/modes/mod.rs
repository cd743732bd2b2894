//! Insertion mode handlers.
//!
//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! Each submodule adds `handle_*_mode` methods to
//! [`TreeBuilder`](super::core::TreeBuilder) for a group of related modes.

mod after;
mod body;
mod head;
mod initial;
mod select;
mod table;
mod template;
