//! Ordered collection of IDF objects.

use os_core::Handle;
use serde::{Deserialize, Serialize};

use crate::idd::IddObjectType;
use crate::object::IdfObject;

/// A flat, ordered list of objects. Insertion order is output order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub objects: Vec<IdfObject>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: IdfObject) -> Handle {
        let handle = object.handle;
        self.objects.push(object);
        handle
    }

    pub fn objects(&self) -> impl Iterator<Item = &IdfObject> {
        self.objects.iter()
    }

    pub fn objects_by_type<'a>(
        &'a self,
        object_type: &'a IddObjectType,
    ) -> impl Iterator<Item = &'a IdfObject> + 'a {
        self.objects
            .iter()
            .filter(move |o| &o.object_type == object_type)
    }

    pub fn object(&self, handle: Handle) -> Option<&IdfObject> {
        self.objects.iter().find(|o| o.handle == handle)
    }

    pub fn object_mut(&mut self, handle: Handle) -> Option<&mut IdfObject> {
        self.objects.iter_mut().find(|o| o.handle == handle)
    }

    /// Case-insensitive name lookup within one type.
    pub fn object_by_name(&self, object_type: &IddObjectType, name: &str) -> Option<&IdfObject> {
        self.object_by_name_any(std::slice::from_ref(object_type), name)
    }

    /// First object of any of `types` carrying `name`.
    pub fn object_by_name_any(&self, types: &[IddObjectType], name: &str) -> Option<&IdfObject> {
        let name = name.trim();
        self.objects.iter().find(|o| {
            types.contains(&o.object_type)
                && o.name().is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }

    pub fn remove_object(&mut self, handle: Handle) -> Option<IdfObject> {
        let index = self.objects.iter().position(|o| o.handle == handle)?;
        Some(self.objects.remove(index))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
