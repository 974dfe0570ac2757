mod category_properties;
mod cli_contracts;
mod permission_matrix;
mod persistence;
mod support;
