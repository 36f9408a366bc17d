use bindery_core::prelude::*;
use bindery_view::{BoundView, View, ViewModelRef};

#[derive(Default)]
struct CounterModel {
    count: ObservableValue<i32>,
    label: ObservableValue<String>,
}

impl ViewModel for CounterModel {
    fn slots() -> SlotTable<Self> {
        slots!(CounterModel {
            "Count" => count,
            "Label" => label,
        })
    }
}

struct CounterView {
    view: BoundView<CounterModel>,
}

impl CounterView {
    fn new() -> anyhow::Result<Self> {
        let mut registry = BindingRegistry::<CounterModel>::new();
        registry
            .add("Count", |old: &i32, new: &i32| {
                println!("Count: {old} -> {new}");
            })?
            .add("Label", |_: &String, new: &String| {
                println!("Label: {new}");
            })?;
        Ok(Self {
            view: BoundView::new(registry),
        })
    }
}

impl View for CounterView {
    type Model = CounterModel;

    fn bound_view(&self) -> &BoundView<CounterModel> {
        &self.view
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let view = CounterView::new()?;
    let first = ViewModelRef::new(CounterModel::default());
    let second = ViewModelRef::new(CounterModel {
        count: ObservableValue::new(100),
        ..CounterModel::default()
    });

    view.set_binding_context(Some(first.clone()))?;
    first.label.set("first".into());
    first.count.update(|c| *c += 1);
    first.count.update(|c| *c += 1);

    view.set_binding_context(Some(second.clone()))?;
    first.count.set(0); // detached, prints nothing
    second.label.set("second".into());
    second.count.set(99);

    log::info!("first = {}, second = {}", first.count, second.count);
    view.bound_view().teardown()?;
    Ok(())
}
