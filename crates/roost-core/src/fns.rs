//! Function-style resources.
//!
//! Adapters that let a plain closure drive a computation site. The
//! closure re-runs whenever its arguments change (destroy-and-recreate
//! underneath), and an optional cleanup runs before each re-run and when
//! the site is torn down.

use std::marker::PhantomData;

use crate::error::HookError;
use crate::owner::Owner;
use crate::resource::{Hooks, Resource, ResourceDef};

/// Cleanup returned by a function-style resource's run.
pub type Cleanup = Box<dyn FnOnce()>;

/// One run of a function-style resource: the produced value plus the
/// cleanup to run before the next one.
pub struct FnResource<A, V> {
    value: V,
    cleanup: Option<Cleanup>,
    _args: PhantomData<fn(A)>,
}

impl<A: 'static, V: Clone + 'static> Resource for FnResource<A, V> {
    type Args = A;
    type Value = V;

    fn hooks(&self) -> Hooks {
        if self.cleanup.is_some() {
            Hooks::TEARDOWN
        } else {
            Hooks::empty()
        }
    }

    fn teardown(&mut self) -> Result<(), HookError> {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
        Ok(())
    }

    fn value(&self) -> V {
        self.value.clone()
    }
}

/// Definition that re-runs `run` for every argument change.
pub fn fn_resource<A, V>(run: impl Fn(&Owner, &A) -> V + 'static) -> ResourceDef<FnResource<A, V>>
where
    A: 'static,
    V: Clone + 'static,
{
    ResourceDef::new(move |owner, args| {
        Ok(FnResource {
            value: run(owner, args),
            cleanup: None,
            _args: PhantomData,
        })
    })
}

/// Like [`fn_resource`], with a cleanup invoked before the next run and
/// when the site is torn down.
pub fn fn_resource_with_cleanup<A, V>(
    run: impl Fn(&Owner, &A) -> (V, Cleanup) + 'static,
) -> ResourceDef<FnResource<A, V>>
where
    A: 'static,
    V: Clone + 'static,
{
    ResourceDef::new(move |owner, args| {
        let (value, cleanup) = run(owner, args);
        Ok(FnResource {
            value,
            cleanup: Some(cleanup),
            _args: PhantomData,
        })
    })
}
