// Example: keep the realized window in sync with inserts, removals and focus.
use realizer::{
    Constraint, ElementFactory, ItemsChanged, Orientation, OwnerId, Rect, ScrollHost, Size,
    StackLayout, VirtualizingEngine,
};

#[derive(Debug)]
struct Cell {
    value: u32,
    index: usize,
    focused: bool,
}

struct Cells;

impl ElementFactory<u32> for Cells {
    type Element = Cell;

    fn get_or_create(&mut self, item: &u32, index: usize, _owner: OwnerId) -> Cell {
        Cell {
            value: *item,
            index,
            focused: false,
        }
    }

    fn recycle(&mut self, _element: Cell) {}

    fn update_index(&mut self, element: &mut Cell, _old_index: usize, new_index: usize) {
        element.index = new_index;
    }

    fn clear_focus(&mut self, element: &mut Cell) {
        println!("clearing focus on item {}", element.value);
        element.focused = false;
    }
}

struct FixedViewport;

impl ScrollHost<Cell> for FixedViewport {
    fn bring_into_view(&mut self, _element: &Cell, _rect: Rect) -> Option<Rect> {
        None
    }
}

fn dump(engine: &VirtualizingEngine<u32, Cells, impl realizer::LayoutStrategy<Cell>>) {
    let cells: Vec<(usize, u32)> = engine
        .realized_elements()
        .map(|(i, c)| (i, c.value))
        .collect();
    println!("{cells:?}");
}

fn main() {
    let mut items: Vec<u32> = (0..100).collect();
    let layout = StackLayout::new(
        Orientation::Vertical,
        |_: &mut Cell, _: usize, _: Constraint| Size::new(80.0, 10.0),
        |_: &mut Cell, _: usize, _: Rect| {},
    );
    let mut engine = VirtualizingEngine::new(Cells, layout);
    let available = Constraint::new(Some(80.0), None);
    engine.on_viewport_changed(Rect::new(0.0, 0.0, 80.0, 50.0));
    engine.layout(&items, available, &mut FixedViewport);
    dump(&engine);

    // Insert two items at the front; realized cells shift down by two indices.
    items.splice(0..0, [1000, 1001]);
    engine.items_changed(ItemsChanged::Insert { at: 0, count: 2 });
    engine.layout(&items, available, &mut FixedViewport);
    dump(&engine);

    // A focused cell survives scrolling away and is torn down when its item is removed.
    engine.focus_entered(3);
    if let Some(cell) = engine.try_get_element_mut(3) {
        cell.focused = true;
    }
    engine.on_viewport_changed(Rect::new(0.0, 500.0, 80.0, 50.0));
    engine.layout(&items, available, &mut FixedViewport);
    println!("focused index while scrolled away: {:?}", engine.focused_index());

    items.remove(3);
    engine.items_changed(ItemsChanged::Remove { at: 3, count: 1 });
    engine.layout(&items, available, &mut FixedViewport);
    println!("focused index after removal: {:?}", engine.focused_index());
    dump(&engine);
}
