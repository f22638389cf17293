//! End-to-end program tests: whole ASTs run through the interpreter over a
//! host-supplied root environment.
