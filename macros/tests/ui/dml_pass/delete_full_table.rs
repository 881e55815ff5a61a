fn main() {
    let stmt: drizzle_core::ir::DeleteStatement = drizzle_macros::define_delete!(|q| q
        .delete("sessions")
        .allow_full_table_delete()
        .build());
    let _ = stmt;
}
