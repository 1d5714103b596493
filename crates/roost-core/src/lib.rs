//! # Resources, lifecycle records, and managers
//!
//! Roost embeds long-lived, stateful objects ("resources") inside a
//! recomputable value graph. The reactive side decides *when* a value
//! must be recomputed; this crate decides *what happens to the
//! underlying instance* when that recomputation occurs: refresh it in
//! place, or tear it down and build a fresh one, with teardown running
//! exactly once per live instance. There are three main pieces:
//!
//! - [`Resource`] / [`ResourceDef`] — how to build one instance, and
//!   which lifecycle hooks it carries.
//! - [`ResourceManager`] — the engine holding a lifecycle record
//!   `{factory, args, instance}` per computation site.
//! - [`ResourceCell`] — a computation site: wires a template into the
//!   dependency graph and caches the current value.
//!
//! ## Declaring a resource
//!
//! A resource commits to one of two strategies at construction. One that
//! declares [`Hooks::UPDATE`] absorbs new arguments in place and is never
//! replaced; one that does not is destroyed and rebuilt whenever its
//! arguments change:
//!
//! ```rust
//! use roost_core::*;
//! use std::rc::Rc;
//!
//! struct Title {
//!     text: String,
//! }
//!
//! impl Resource for Title {
//!     type Args = String;
//!     type Value = String;
//!
//!     fn value(&self) -> String {
//!         self.text.clone()
//!     }
//! }
//!
//! let manager = Rc::new(ResourceManager::new(Owner::new()));
//! let def = ResourceDef::new(|_, text: &String| Ok(Title { text: text.clone() }));
//!
//! let name = signal("Jane".to_string());
//! let template = def.template({
//!     let name = name.clone();
//!     move || name.get()
//! });
//!
//! let cell = ResourceCell::new(manager, template).unwrap();
//! assert_eq!(cell.value().unwrap(), "Jane");
//!
//! name.set("Joe".to_string());
//! assert_eq!(cell.value().unwrap(), "Joe");
//! ```
//!
//! Writes to signals the template never read leave the resource alone;
//! the cell keeps serving its cached value.
//!
//! ## Function-style resources
//!
//! [`fn_resource`] and [`fn_resource_with_cleanup`] wrap a plain closure
//! into a definition. The closure re-runs per argument change; the
//! returned cleanup runs before each re-run and when the site is torn
//! down:
//!
//! ```rust
//! use roost_core::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let active = Rc::new(Cell::new(0));
//! let def = {
//!     let active = active.clone();
//!     fn_resource_with_cleanup(move |_, label: &String| {
//!         active.set(active.get() + 1);
//!         let active = active.clone();
//!         (label.clone(), Box::new(move || active.set(active.get() - 1)) as Cleanup)
//!     })
//! };
//!
//! let manager = Rc::new(ResourceManager::new(Owner::new()));
//! let label = signal("tick".to_string());
//! let cell = ResourceCell::new(
//!     manager,
//!     def.template({
//!         let label = label.clone();
//!         move || label.get()
//!     }),
//! )
//! .unwrap();
//!
//! assert_eq!(cell.value().unwrap(), "tick");
//! assert_eq!(active.get(), 1);
//!
//! cell.dispose().unwrap();
//! assert_eq!(active.get(), 0);
//! ```
//!
//! ## Disposal
//!
//! Each cell tracks a single destroyable handle: the instance itself for
//! updatable resources, the lifecycle record for replaceable ones. A
//! cell created inside [`Scope::run`] is released when the scope is
//! disposed (e.g. when a navigation entry is popped); otherwise call
//! [`ResourceCell::dispose`] yourself.

pub mod cell;
pub mod destroyable;
pub mod error;
pub mod fns;
pub mod manager;
pub mod owner;
pub mod prelude;
pub mod reactive;
pub mod registry;
pub mod resource;
pub mod scope;
pub mod signal;

pub use cell::*;
pub use error::*;
pub use fns::*;
pub use manager::*;
pub use owner::*;
pub use prelude::*;
pub use reactive::*;
pub use registry::*;
pub use resource::*;
pub use scope::*;
pub use signal::*;
