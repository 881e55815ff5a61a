fn main() {
    let stmt: drizzle_core::ir::InsertStatement = drizzle_macros::define_insert!(|q, p| q
        .insert("users", Row { name: p.name, age: p.age })
        .returning(Some(|row| row.id))
        .build());
    let _ = stmt;
}
