/*
    Cross-module tests for core_room

    Test suite covering:
    - Resolution scenarios against the in-memory and SQL directories
    - Failure policy (unavailable and slow reads)
    - Identity gate
    - Randomized visibility and count invariants
*/
