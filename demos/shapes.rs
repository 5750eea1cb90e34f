//! Polymorphic shapes held by value.
//!
//! This example demonstrates:
//! 1. Storing different concrete types behind `ValueCell<dyn Shape>`
//! 2. Cloning a whole drawing without losing any concrete type
//! 3. Swapping a shape for another type with `reset_with`
//! 4. Identity comparison and moving a shape out with `to_unique`

use value_cell::prelude::*;

trait Shape {
    fn name(&self) -> String;
    fn area(&self) -> f64;
    fn scale(&mut self, by: f64);
}

#[derive(Clone)]
struct Circle {
    radius: f64,
}

#[derive(Clone)]
struct Rect {
    width: f64,
    height: f64,
}

impl Shape for Circle {
    fn name(&self) -> String {
        format!("circle r={}", self.radius)
    }

    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    fn scale(&mut self, by: f64) {
        self.radius *= by;
    }
}

impl Shape for Rect {
    fn name(&self) -> String {
        format!("rect {}x{}", self.width, self.height)
    }

    fn area(&self) -> f64 {
        self.width * self.height
    }

    fn scale(&mut self, by: f64) {
        self.width *= by;
        self.height *= by;
    }
}

upcast!(Circle, Rect => dyn Shape);

type Drawing = Vec<ValueCell<dyn Shape>>;

fn print_drawing(title: &str, drawing: &Drawing) {
    println!("{title}:");
    for shape in drawing {
        println!(
            "  {:<16} area {:>7.2}  at {:p}",
            shape.name(),
            shape.area(),
            shape.addr()
        );
    }
}

fn main() {
    let original: Drawing = vec![
        make_derived_value::<dyn Shape, _>(Circle { radius: 1.0 }),
        make_derived_value::<dyn Shape, _>(Rect {
            width: 2.0,
            height: 3.0,
        }),
    ];
    print_drawing("Original", &original);

    // Every shape is deep-copied as its own concrete type.
    let mut copy = original.clone();
    for shape in &mut copy {
        shape.scale(2.0);
    }
    print_drawing("Scaled copy", &copy);
    print_drawing("Original is untouched", &original);

    // Replacing a shape captures the new concrete type for later copies.
    copy[0].reset_with(Box::new(Rect {
        width: 1.0,
        height: 1.0,
    }));
    let copy_of_copy = copy.clone();
    print_drawing("Copy of the edited copy", &copy_of_copy);

    println!();
    println!("original[0] == copy[0]: {}", original[0] == copy[0]);

    let mut taken = copy.remove(1);
    let unique = taken.to_unique();
    println!("moved out {} (cell now empty: {})", unique.name(), taken == Null);
}
