//! Errors raised by the maze builder, carver and router.
//!
//! `error_chain!` creates the `Error`, `ErrorKind`, `ResultExt` and `Result` types.
//! `Result` is a typedef of std `Result` with our own `Error`, and the foreign link gives
//! the `From` conversion that lets `?` work on JSON (de)serialization failures.

#![allow(deprecated)] // error_chain still implements Error::description

use crate::cells::{CompassPrimary, Coordinate};
use error_chain::error_chain;

error_chain! {

    foreign_links {
        Json(::serde_json::Error);
    }

    errors {
        InvalidDimensions(rows: usize, columns: usize) {
            description("invalid maze dimensions")
            display("invalid maze dimensions {}x{}: rows and columns must be at least 1", rows, columns)
        }

        InvalidCoordinate(coord: Coordinate, rows: usize, columns: usize) {
            description("coordinate outside of the maze")
            display("coordinate {} is outside of a {}x{} maze", coord, rows, columns)
        }

        ExitNotOnBoundary(goal: Coordinate, direction: CompassPrimary) {
            description("exit wall does not face the maze boundary")
            display("cannot open the {:?} wall of goal {} as an exit: it is not on the {:?} boundary",
                    direction, goal, direction)
        }

        NoRouteFound(start: Coordinate, goal: Coordinate) {
            description("no route between start and goal")
            display("no route found from {} to {}", start, goal)
        }

        MalformedDescription(reason: String) {
            description("malformed maze description")
            display("malformed maze description: {}", reason)
        }
    }
}
