pub mod yield_calc;
