// Example: realize a long list through a minimal scroll host.
use realizer::{
    Constraint, ElementFactory, Orientation, OwnerId, Rect, ScrollHost, Size, StackLayout,
    VirtualizingEngine,
};

#[derive(Debug)]
struct Label {
    text: String,
    rect: Rect,
}

#[derive(Default)]
struct Labels {
    created: usize,
    pool: Vec<Label>,
}

impl ElementFactory<String> for Labels {
    type Element = Label;

    fn get_or_create(&mut self, item: &String, _index: usize, _owner: OwnerId) -> Label {
        let mut label = self.pool.pop().unwrap_or_else(|| {
            self.created += 1;
            Label {
                text: String::new(),
                rect: Rect::default(),
            }
        });
        label.text.clone_from(item);
        label
    }

    fn recycle(&mut self, element: Label) {
        self.pool.push(element);
    }
}

struct Window {
    scroll: f64,
    height: f64,
}

impl ScrollHost<Label> for Window {
    fn bring_into_view(&mut self, _element: &Label, rect: Rect) -> Option<Rect> {
        self.scroll = rect.y;
        Some(Rect::new(0.0, self.scroll, 200.0, self.height))
    }
}

fn main() {
    let items: Vec<String> = (0..1_000_000).map(|i| format!("row {i}")).collect();
    let layout = StackLayout::new(
        Orientation::Vertical,
        |_: &mut Label, _: usize, c: Constraint| Size::new(c.width.unwrap_or(200.0), 24.0),
        |label: &mut Label, _: usize, rect: Rect| label.rect = rect,
    );
    let mut engine: VirtualizingEngine<String, _, _> =
        VirtualizingEngine::new(Labels::default(), layout);
    let mut window = Window {
        scroll: 0.0,
        height: 240.0,
    };
    let available = Constraint::new(Some(200.0), None);

    engine.on_viewport_changed(Rect::new(0.0, 0.0, 200.0, window.height));
    let extent = engine.layout(&items, available, &mut window);
    println!("extent={extent:?} realized={:?}", engine.realized_range());

    window.scroll = 123_456.0;
    engine.on_viewport_changed(Rect::new(0.0, window.scroll, 200.0, window.height));
    engine.layout(&items, available, &mut window);
    println!(
        "after scroll: realized={:?} first={:?}",
        engine.realized_range(),
        engine.realized_elements().next().map(|(_, l)| &l.text)
    );

    let found = engine
        .bring_into_view(&items, 999_999, None, &mut window)
        .map(|l| l.text.clone());
    println!("bring_into_view -> {found:?} scroll={}", window.scroll);
    println!("elements created={}", engine.factory().created);
}
