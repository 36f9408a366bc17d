#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::prelude::*;

    #[derive(Default)]
    struct Vm {
        score: ObservableValue<i32>,
        title: ObservableValue<Option<String>>,
    }

    impl ViewModel for Vm {
        fn slots() -> SlotTable<Self> {
            slots!(Vm {
                "Score" => score,
                "Title" => title,
            })
        }
    }

    type Seen = Arc<Mutex<Vec<(i32, i32)>>>;

    fn score_registry() -> (BindingRegistry<Vm>, Seen) {
        let seen: Seen = Arc::default();
        let mut reg = BindingRegistry::<Vm>::new();
        reg.add("Score", {
            let seen = seen.clone();
            move |old: &i32, new: &i32| seen.lock().push((*old, *new))
        })
        .unwrap();
        (reg, seen)
    }

    #[test]
    fn test_bind_then_unbind() {
        let (reg, seen) = score_registry();
        let vm1 = Vm::default();

        reg.bind(Some(&vm1)).unwrap();
        vm1.score.set(5);
        assert_eq!(*seen.lock(), vec![(0, 5)]);

        reg.unbind(Some(&vm1)).unwrap();
        vm1.score.set(9);
        assert_eq!(*seen.lock(), vec![(0, 5)]);
    }

    #[test]
    fn test_swap_active_view_model() {
        let (reg, seen) = score_registry();
        let vm1 = Vm::default();
        let vm2 = Vm {
            score: ObservableValue::new(40),
            ..Vm::default()
        };

        reg.bind(Some(&vm1)).unwrap();
        reg.unbind(Some(&vm1)).unwrap();
        reg.bind(Some(&vm2)).unwrap();

        vm1.score.set(1);
        assert!(seen.lock().is_empty());

        vm2.score.set(2);
        assert_eq!(*seen.lock(), vec![(40, 2)]);
    }

    #[test]
    fn test_one_registry_many_instances() {
        let (reg, seen) = score_registry();
        let a = Vm::default();
        let b = Vm::default();
        reg.bind(Some(&a)).unwrap();
        reg.bind(Some(&b)).unwrap();

        a.score.set(1);
        b.score.set(2);
        assert_eq!(*seen.lock(), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn test_double_bind_double_fires() {
        let (reg, seen) = score_registry();
        let vm = Vm::default();
        reg.bind(Some(&vm)).unwrap();
        reg.bind(Some(&vm)).unwrap();

        vm.score.set(3);
        assert_eq!(seen.lock().len(), 2);

        reg.unbind(Some(&vm)).unwrap();
        vm.score.set(4);
        assert_eq!(seen.lock().len(), 3);

        reg.unbind(Some(&vm)).unwrap();
        vm.score.set(5);
        assert_eq!(seen.lock().len(), 3);
    }

    #[test]
    fn test_unknown_slot_fails_at_add() {
        let mut reg = BindingRegistry::<Vm>::new();
        let err = reg.add("Scroe", |_: &i32, _: &i32| {}).unwrap_err();
        assert_eq!(
            err,
            BindError::UnknownSlot {
                view_model: std::any::type_name::<Vm>(),
                name: "Scroe".into(),
            }
        );
    }

    #[test]
    fn test_null_bind_fires_nothing() {
        let (reg, seen) = score_registry();
        assert!(reg.bind(None).is_ok());
        assert!(reg.unbind(None).is_ok());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_optional_slot() {
        let titles = Arc::new(Mutex::new(Vec::new()));
        let mut reg = BindingRegistry::<Vm>::new();
        reg.add("Title", {
            let titles = titles.clone();
            move |old: &Option<String>, new: &Option<String>| {
                titles.lock().push((old.clone(), new.clone()))
            }
        })
        .unwrap();

        let vm = Vm::default();
        assert_eq!(vm.title.to_string(), "None");
        reg.bind(Some(&vm)).unwrap();
        vm.title.set(Some("Level 1".into()));
        vm.title.set(None);
        assert_eq!(
            *titles.lock(),
            vec![
                (None, Some("Level 1".to_string())),
                (Some("Level 1".to_string()), None),
            ]
        );
    }

    #[test]
    fn test_concurrent_bind_of_distinct_instances() {
        let (reg, seen) = score_registry();
        let vms: Vec<Vm> = (0..8).map(|_| Vm::default()).collect();

        std::thread::scope(|s| {
            for vm in &vms {
                let reg = &reg;
                s.spawn(move || {
                    reg.bind(Some(vm)).unwrap();
                    vm.score.set(1);
                });
            }
        });

        assert_eq!(seen.lock().len(), vms.len());
        assert!(seen.lock().iter().all(|p| *p == (0, 1)));
    }
}
