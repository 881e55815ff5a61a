fn main() {
    let stmt = drizzle_macros::define_insert!(|q, p| q
        .insert("users", Row { name: p.name, age: p.age })
        .returning(Some(|row| Row { id: row.id, ..row }))
        .build());
    let _ = stmt;
}
