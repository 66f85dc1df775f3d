pub use k8s_openapi as openapi;
pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::api::storage::v1 as storagev1;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

pub const NO_SCHEDULE: &str = "NoSchedule";
pub const NO_EXECUTE: &str = "NoExecute";

pub trait ObjectMetaExt {
    fn new(name: impl ToString) -> Self;
}

impl ObjectMetaExt for metav1::ObjectMeta {
    fn new(name: impl ToString) -> Self {
        let name = Some(name.to_string());
        Self { name, ..default() }
    }
}

pub trait NodeExt {
    fn new(name: impl ToString) -> Self;
    fn with_taints(self, taints: impl IntoIterator<Item = corev1::Taint>) -> Self;
    /// Taints currently set on the node, empty when `spec` or `spec.taints` is absent.
    fn taints(&self) -> &[corev1::Taint];
}

impl NodeExt for corev1::Node {
    fn new(name: impl ToString) -> Self {
        let metadata = metav1::ObjectMeta::new(name);
        Self {
            metadata,
            ..default()
        }
    }

    fn with_taints(self, taints: impl IntoIterator<Item = corev1::Taint>) -> Self {
        let taints = Some(taints.into_iter().collect());
        let spec = corev1::NodeSpec {
            taints,
            ..self.spec.unwrap_or_default()
        };
        Self {
            spec: Some(spec),
            ..self
        }
    }

    fn taints(&self) -> &[corev1::Taint] {
        self.spec
            .as_ref()
            .and_then(|spec| spec.taints.as_deref())
            .unwrap_or_default()
    }
}

pub trait TaintExt {
    fn new(key: impl ToString, effect: impl ToString) -> Self;
    fn no_schedule(key: impl ToString) -> Self;
    fn with_value(self, value: impl ToString) -> Self;
}

impl TaintExt for corev1::Taint {
    fn new(key: impl ToString, effect: impl ToString) -> Self {
        Self {
            key: key.to_string(),
            effect: effect.to_string(),
            ..default()
        }
    }

    fn no_schedule(key: impl ToString) -> Self {
        Self::new(key, NO_SCHEDULE)
    }

    fn with_value(self, value: impl ToString) -> Self {
        Self {
            value: Some(value.to_string()),
            ..self
        }
    }
}

pub trait CSINodeExt {
    fn new(name: impl ToString) -> Self;
    fn with_driver(self, driver: storagev1::CSINodeDriver) -> Self;
    fn driver(&self, name: &str) -> Option<&storagev1::CSINodeDriver>;
}

impl CSINodeExt for storagev1::CSINode {
    fn new(name: impl ToString) -> Self {
        let metadata = metav1::ObjectMeta::new(name);
        Self {
            metadata,
            ..default()
        }
    }

    fn with_driver(mut self, driver: storagev1::CSINodeDriver) -> Self {
        self.spec.drivers.push(driver);
        self
    }

    fn driver(&self, name: &str) -> Option<&storagev1::CSINodeDriver> {
        self.spec.drivers.iter().find(|driver| driver.name == name)
    }
}

pub trait CSINodeDriverExt {
    fn new(name: impl ToString, node_id: impl ToString) -> Self;
    fn with_allocatable_count(self, count: impl Into<Option<i32>>) -> Self;
    /// Number of volumes the driver can attach, `None` until the driver registered it.
    fn allocatable_count(&self) -> Option<i32>;
}

impl CSINodeDriverExt for storagev1::CSINodeDriver {
    fn new(name: impl ToString, node_id: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            node_id: node_id.to_string(),
            ..default()
        }
    }

    fn with_allocatable_count(self, count: impl Into<Option<i32>>) -> Self {
        let allocatable = storagev1::VolumeNodeResources {
            count: count.into(),
        };
        Self {
            allocatable: Some(allocatable),
            ..self
        }
    }

    fn allocatable_count(&self) -> Option<i32> {
        self.allocatable
            .as_ref()
            .and_then(|allocatable| allocatable.count)
    }
}

pub fn default<T: Default>() -> T {
    T::default()
}
