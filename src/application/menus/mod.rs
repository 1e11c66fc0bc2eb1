/*! The individual menu screens of the application. */

mod blockfall;
mod dinosweep;
mod title;
