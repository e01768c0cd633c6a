//! # Mount Surface
//!
//! Attaches form instances to named containers and detaches them again.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Surface { "header-slot": free, "invoice-root": free }                  │
//! │        │                                                                │
//! │        ▼  mount(&mut surface, "invoice-root", options)                  │
//! │                                                                         │
//! │  Surface { "header-slot": free, "invoice-root": ◆ form 7f3c… }          │
//! │        │        FormHandle ◆ ── owns FormState, returned to caller      │
//! │        ▼  unmount(&mut surface, handle)                                 │
//! │                                                                         │
//! │  Surface { "header-slot": free, "invoice-root": free }                  │
//! │           FormState dropped with the handle                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The surface is owned by the caller; there is no global registry. Two
//! handles never share state, even on the same surface. A container stays
//! occupied only while its handle is alive.

use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{FormError, FormResult};
use crate::state::{FormState, MountOptions};

/// Marks a container as taken by one form instance.
#[derive(Debug)]
struct Occupant {
    instance_id: Uuid,
    alive: Weak<()>,
}

impl Occupant {
    fn live(&self) -> Option<Uuid> {
        (self.alive.strong_count() > 0).then_some(self.instance_id)
    }
}

/// The display containers a host offers, and which form occupies each.
#[derive(Debug, Default)]
pub struct Surface {
    containers: BTreeMap<String, Option<Occupant>>,
}

impl Surface {
    pub fn new() -> Self {
        Surface::default()
    }

    /// Creates a surface with the given (empty) containers.
    pub fn with_containers<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Surface {
            containers: ids.into_iter().map(|id| (id.into(), None)).collect(),
        }
    }

    /// Registers a container. Returns false if it already existed.
    pub fn add_container(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.containers.contains_key(&id) {
            return false;
        }
        self.containers.insert(id, None);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.containers.contains_key(id)
    }

    /// The form instance mounted in `id`, if any.
    pub fn occupant(&self, id: &str) -> Option<Uuid> {
        self.containers
            .get(id)
            .and_then(|slot| slot.as_ref())
            .and_then(Occupant::live)
    }

    /// Number of mounted forms.
    pub fn mounted_count(&self) -> usize {
        self.containers
            .values()
            .filter_map(|slot| slot.as_ref().and_then(Occupant::live))
            .count()
    }
}

/// A mounted form. Dropping it frees its container just like `unmount`.
#[derive(Debug)]
pub struct FormHandle {
    instance_id: Uuid,
    container_id: String,
    class_name: Option<String>,
    state: FormState,
    _alive: Rc<()>,
}

impl FormHandle {
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn form(&self) -> &FormState {
        &self.state
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

/// Attaches a new form instance to `container_id`.
///
/// ## Errors
/// - `CONTAINER_NOT_FOUND` if the surface has no such container
/// - `CONTAINER_OCCUPIED` if another form is mounted there
pub fn mount(
    surface: &mut Surface,
    container_id: &str,
    options: MountOptions,
) -> FormResult<FormHandle> {
    let slot = surface
        .containers
        .get_mut(container_id)
        .ok_or_else(|| FormError::container_not_found(container_id))?;
    if slot.as_ref().and_then(Occupant::live).is_some() {
        return Err(FormError::container_occupied(container_id));
    }

    let instance_id = Uuid::new_v4();
    let alive = Rc::new(());
    *slot = Some(Occupant {
        instance_id,
        alive: Rc::downgrade(&alive),
    });

    let MountOptions { config, on_submit } = options;
    let mut state = FormState::new(config.defaults);
    state.set_submit_handler(on_submit);

    info!(%instance_id, container = %container_id, "Form mounted");

    Ok(FormHandle {
        instance_id,
        container_id: container_id.to_string(),
        class_name: config.class_name,
        state,
        _alive: alive,
    })
}

/// Detaches a form and releases its state.
///
/// The handle is consumed either way, which also frees its home container;
/// an error only reports that this surface did not list it.
pub fn unmount(surface: &mut Surface, handle: FormHandle) -> FormResult<()> {
    let FormHandle {
        instance_id,
        container_id,
        ..
    } = handle;

    match surface.containers.get_mut(&container_id) {
        Some(slot) if slot.as_ref().map(|o| o.instance_id) == Some(instance_id) => {
            *slot = None;
            info!(%instance_id, container = %container_id, "Form unmounted");
            Ok(())
        }
        _ => {
            debug!(%instance_id, container = %container_id, "unmount of unknown handle");
            Err(FormError::not_mounted(&container_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use fattura_core::LineItemEdit;

    #[test]
    fn test_mount_and_unmount() {
        let mut surface = Surface::with_containers(["invoice-root"]);

        let handle = mount(
            &mut surface,
            "invoice-root",
            MountOptions::new().class_name("fattura"),
        )
        .unwrap();

        assert_eq!(handle.container_id(), "invoice-root");
        assert_eq!(handle.class_name(), Some("fattura"));
        assert_eq!(surface.occupant("invoice-root"), Some(handle.instance_id()));
        assert_eq!(surface.mounted_count(), 1);

        unmount(&mut surface, handle).unwrap();
        assert_eq!(surface.occupant("invoice-root"), None);
        assert_eq!(surface.mounted_count(), 0);
    }

    #[test]
    fn test_missing_container() {
        let mut surface = Surface::new();
        let err = mount(&mut surface, "nowhere", MountOptions::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ContainerNotFound);
    }

    #[test]
    fn test_occupied_container() {
        let mut surface = Surface::with_containers(["a"]);
        let _first = mount(&mut surface, "a", MountOptions::new()).unwrap();

        let err = mount(&mut surface, "a", MountOptions::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ContainerOccupied);
    }

    #[test]
    fn test_container_reusable_after_unmount() {
        let mut surface = Surface::with_containers(["a"]);
        let first = mount(&mut surface, "a", MountOptions::new()).unwrap();
        let first_id = first.instance_id();
        unmount(&mut surface, first).unwrap();

        let second = mount(&mut surface, "a", MountOptions::new()).unwrap();
        assert_ne!(second.instance_id(), first_id);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut surface = Surface::with_containers(["left", "right"]);
        let mut left = mount(&mut surface, "left", MountOptions::new()).unwrap();
        let right = mount(&mut surface, "right", MountOptions::new()).unwrap();

        left.form_mut().add_line_item();
        left.form_mut()
            .update_line_item(0, LineItemEdit::UnitPrice(Some(100.0)))
            .unwrap();

        assert_eq!(left.form().draft().line_items.len(), 2);
        assert_eq!(right.form().draft().line_items.len(), 1);
        assert_eq!(right.form().totals().display().total, "0.00");
    }

    #[test]
    fn test_unmount_foreign_handle() {
        let mut home = Surface::with_containers(["a"]);
        let mut other = Surface::with_containers(["a"]);
        let handle = mount(&mut home, "a", MountOptions::new()).unwrap();

        let err = unmount(&mut other, handle).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotMounted);
        assert_eq!(home.occupant("a"), None);
        assert!(mount(&mut home, "a", MountOptions::new()).is_ok());
    }

    #[test]
    fn test_dropped_handle_frees_container() {
        let mut surface = Surface::with_containers(["root"]);
        {
            let _handle = mount(&mut surface, "root", MountOptions::new()).unwrap();
            assert_eq!(surface.mounted_count(), 1);
        }
        assert_eq!(surface.mounted_count(), 0);

        let again = mount(&mut surface, "root", MountOptions::new()).unwrap();
        assert_eq!(surface.occupant("root"), Some(again.instance_id()));
    }

    #[test]
    fn test_add_container() {
        let mut surface = Surface::new();
        assert!(surface.add_container("a"));
        assert!(!surface.add_container("a"));
        assert!(surface.contains("a"));
    }
}
