mod common;

#[cfg(test)]
mod test_attack;


#[cfg(test)]
mod test_enemy_turn;



#[cfg(test)]
mod test_quest_progress;
