fn main() {
    let op: drizzle_core::ir::Operation = drizzle_macros::define_select!(|q| q
        .from("users")
        .join(
            q.from("departments"),
            |u| u.department_id,
            |d| d.id,
            Some(|u, d| UserDept { user_name: u.name, dept_name: d.name })
        )
        .build());
    let _ = op;
}
