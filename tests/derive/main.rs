mod r#enum;
mod field;
mod r#struct;
