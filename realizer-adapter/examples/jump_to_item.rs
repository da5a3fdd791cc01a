// Example: jump to an item that has never been realized, through the presenter.
use realizer::{Constraint, Orientation, Rect, Size, StackLayout, VirtualizingEngine};
use realizer_adapter::{KindedFactory, Pooled, Presenter};

fn main() {
    let factory = KindedFactory::new(
        |_: &u64, _| (),
        |e: &mut u64, item: &u64, _| *e = *item,
    )
    .with_kind((), || 0u64);
    let layout = StackLayout::new(
        Orientation::Horizontal,
        |p: &mut Pooled<(), u64>, _: usize, c: Constraint| {
            let width = 40.0 + (p.element % 5) as f64 * 10.0;
            Size::new(width, c.height.unwrap_or(60.0))
        },
        |_: &mut Pooled<(), u64>, _: usize, _: Rect| {},
    );
    let engine = VirtualizingEngine::new(factory, layout);
    let items: Vec<u64> = (0..50_000).collect();
    let mut presenter = Presenter::new(items, engine, Size::new(600.0, 60.0));

    let found = presenter.bring_into_view(31_337).map(|p| p.element);
    println!(
        "found={found:?} offset={} visible={:?}",
        presenter.surface().offset(),
        presenter.visible_indices()
    );
    println!(
        "realized={:?} extent={:?}",
        presenter.engine().realized_range(),
        presenter.surface().extent()
    );
}
