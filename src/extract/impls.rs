mod compound;
mod numeric;
mod other;
