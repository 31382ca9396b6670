pub mod updaters;
